mod reaction_service;

pub use reaction_service::ReactionService;
