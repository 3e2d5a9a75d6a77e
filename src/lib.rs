pub mod bonus;
pub mod generator;
pub mod pathfinding;
pub mod scoring;
pub mod simple_pathfinding;
pub mod tile;
