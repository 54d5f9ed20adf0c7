//! 命令定义和实现

pub mod profile;
pub mod simulate;
pub mod statics;

pub use profile::ProfileCommand;
pub use simulate::SimulateCommand;
pub use statics::StaticsCommand;
