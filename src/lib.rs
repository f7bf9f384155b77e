// Library exports for hicolor-forge

pub mod builder;
pub mod config;
pub mod model;
pub mod pipeline;

// Re-export the build steps
pub use pipeline::{
    hicolor,
    iconfont,
    rgba,
};
