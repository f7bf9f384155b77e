pub mod fs_ops;
pub mod hicolor;
pub mod iconfont;
pub mod png_writer;
pub mod rgba;
