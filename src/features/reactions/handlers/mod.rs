mod reaction_handler;

pub use reaction_handler::*;
