pub mod animation;
pub mod app;
pub mod camera;
pub mod cli;
pub mod clock;
pub mod loaders;
pub mod math;
pub mod mixer;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod session;
