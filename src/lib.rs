pub mod config;
pub mod dedup;
pub mod exports;
pub mod material_manager;
pub mod scene_graph;
