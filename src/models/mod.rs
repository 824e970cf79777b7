pub mod admin;
pub mod announcement;
pub mod bulk;
pub mod company;
pub mod cv;
pub mod feedback;
pub mod interview;
pub mod pdf;
pub mod room;
pub mod shortlist;
pub mod stall;
pub mod student;
pub mod user;

pub use admin::*;
pub use announcement::*;
pub use bulk::*;
pub use company::*;
pub use cv::*;
pub use feedback::*;
pub use interview::*;
pub use pdf::*;
pub use room::*;
pub use shortlist::*;
pub use stall::*;
pub use student::*;
pub use user::*;
