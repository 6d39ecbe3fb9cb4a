pub mod config;
pub mod errors;
pub mod prompt;
pub mod runner;
pub mod seq;
pub mod taxfetch;

use crate::errors::SeqforgeError;

pub fn run() -> Result<(), SeqforgeError> {
    runner::run()
}
