// Local ONNX models: where they live and how to fetch them.

pub mod download;
