pub mod file_record;
pub mod identifier;
pub mod night;
pub mod status;

pub use file_record::*;
pub use identifier::*;
pub use night::*;
pub use status::*;
