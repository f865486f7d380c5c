pub mod ast;
pub mod commands;
pub mod ids;
pub mod io;
pub mod paths;
pub mod patterns;
pub mod pipeline;
pub mod transform;
