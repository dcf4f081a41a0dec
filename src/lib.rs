pub mod bounds;
pub mod config;
pub mod error;
pub mod food;
pub mod input;
pub mod machine;
pub mod renderer;
pub mod rules;
pub mod session;
pub mod snake;
pub mod terminal_runtime;
pub mod timer;
