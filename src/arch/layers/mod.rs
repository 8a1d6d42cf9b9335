mod dense;
mod layer;
mod relu;

pub use dense::Dense;
pub use layer::Layer;
pub use relu::Relu;
