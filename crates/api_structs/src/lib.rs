mod device;
mod message;
mod reminder;
mod status;

pub mod dtos {
    pub use crate::device::dtos::*;
    pub use crate::reminder::dtos::*;
}

pub use crate::device::api::*;
pub use crate::message::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
