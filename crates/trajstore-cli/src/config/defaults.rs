pub struct DefaultsConfig {
    pub box_file_extension: String,
    pub output_extension: String,
    pub overwrite: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            box_file_extension: "sle".to_string(),
            output_extension: "mdstore".to_string(),
            overwrite: false,
        }
    }
}
