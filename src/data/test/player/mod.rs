use crate::{data::player::PlayerRepository, error::AppError};
use test_utils::{builder::TestBuilder, factory};

mod add_result;
mod get;
