pub mod domain;
pub mod ports;

pub use domain::{
    normalize_hashtag, AiPrompt, AiResponse, Captions, Draft, DraftPatch, PreferencesPatch, User,
    UserPreferences,
};
pub use ports::{ContentGenerator, KeyValueStore, PortError, PortResult};
