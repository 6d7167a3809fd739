// Named entity recognition: trait-based so the ONNX model can be swapped for
// a fake in tests or another recognizer later.

pub mod analyzer;
pub mod onnx;
pub mod traits;
