pub mod config;

pub mod domain {
    pub mod approval {
        pub mod entity;
    }
    pub mod assessment {
        pub mod entity;
        pub mod errors;
    }
    pub mod image {
        pub mod data_url;
        pub mod value_objects;
    }
}

pub mod application {
    pub mod analyze_image {
        pub mod dto;
        pub mod use_case;
    }
    pub mod approve_assessment {
        pub mod dto;
        pub mod use_case;
    }
    pub mod normalize_image {
        pub mod dto;
        pub mod use_case;
    }
}

pub mod infrastructure {
    pub mod parsing {
        pub mod json_recovery;
        pub mod refusal;
        pub mod remap;
    }
    pub mod security;
    pub mod upload {
        pub mod staging;
    }
    pub mod vision {
        pub mod openai_client;
        pub mod prompts;
        pub mod traits;
    }
}

pub mod presentation {
    pub mod http {
        pub mod errors;
        pub mod extractors {
            pub mod image_input;
        }
        pub mod handlers {
            pub mod analyze;
            pub mod approve;
            pub mod health;
        }
        pub mod middleware {
            pub mod logging;
            pub mod request_id;
        }
        pub mod routes;
        pub mod state;
    }
}
