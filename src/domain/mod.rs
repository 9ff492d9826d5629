pub mod audio;
pub mod content;
pub mod podcast;
pub mod script;
