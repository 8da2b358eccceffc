pub mod prototype;

pub use prototype::PrototypeService;
