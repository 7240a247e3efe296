pub mod annotation {
    pub mod domain {
        pub mod annotation_style;
        pub mod frame_annotator;
    }
    pub mod infrastructure;
}

pub mod classification {
    pub mod domain {
        pub mod emotion;
        pub mod emotion_classifier;
        pub mod input_tensor;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod detection_params;
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod annotate_frames_use_case;
    pub mod emotion_pipeline;
    pub mod pipeline_logger;
    pub mod session;
}

pub mod shared {
    pub mod asset_resolver;
    pub mod config;
    pub mod constants;
    pub mod frame;
    pub mod region;
    pub mod source_metadata;
}

pub mod video {
    pub mod domain {
        pub mod frame_sink;
        pub mod frame_source;
    }
    pub mod infrastructure;
}
