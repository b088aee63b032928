pub mod game_save;
pub mod game_state;
pub mod job;
pub mod message;
pub mod parsed_response;
pub mod perks;
pub mod phase;
