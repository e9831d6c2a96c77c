//! UI panes: timeline, video surface, annotation list, session info, status.

pub mod annotations;
pub mod session_info;
pub mod status;
pub mod timeline;
pub mod video;

pub use annotations::render_annotations;
pub use session_info::render_session_info;
pub use status::render_status_bar;
pub use video::render_video;
