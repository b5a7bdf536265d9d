// 领域模块 - 用于组织应用的业务逻辑
//
// 按业务领域分组:捕获、系统

pub mod capture;
pub mod system;

pub use capture::CaptureDomain;
pub use system::SystemDomain;
