pub const EMOTION_MODEL_NAME: &str = "emotion_model.onnx";

pub const CASCADE_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";

/// Side length of the square classifier input.
pub const DEFAULT_INPUT_SIZE: u32 = 48;

/// Worker threads handed to the inference runtime.
pub const INFERENCE_THREADS: usize = 4;

/// Label text is drawn this far right of and above the region's top-left corner.
pub const LABEL_OFFSET_X: i32 = 10;
pub const LABEL_OFFSET_Y: i32 = 35;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
