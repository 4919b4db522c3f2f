use validator::ValidationError;

const ALLOWED_IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

pub fn validate_image_file(name: &str) -> Result<(), ValidationError> {
    // extension match is case-insensitive, "photo.JPG" is fine
    let ext = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext {
        Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ValidationError::new("image_extension")
            .with_message("images only (jpg or png)".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::validate_image_file;

    #[test]
    fn rejects_missing_extension() {
        assert!(validate_image_file("noextension").is_err());
        assert!(validate_image_file("trailingdot.").is_err());
    }

    #[test]
    fn rejects_disallowed_extension() {
        assert!(validate_image_file("anim.gif").is_err());
        assert!(validate_image_file("doc.pdf").is_err());
    }

    #[test]
    fn accepts_allowed_extensions() {
        assert!(validate_image_file("photo.jpg").is_ok());
        assert!(validate_image_file("photo.png").is_ok());
        assert!(validate_image_file("dir/photo.PNG").is_ok());
    }
}
