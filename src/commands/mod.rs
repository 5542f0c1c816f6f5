pub mod pack;
pub mod prepare;
pub mod split;
