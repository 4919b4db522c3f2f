pub mod validation;

pub mod data_structures {
    use serde;
    use validator::Validate;

    /// Credentials submitted at login. `should_remember` keeps the session
    /// token alive past its normal expiry.
    #[derive(Clone, serde::Serialize, serde::Deserialize, Debug, Validate)]
    pub struct LoginForm {
        #[validate(length(min = 4, max = 20))]
        pub username: String,
        #[validate(length(min = 4, max = 20))]
        pub password: String,
        #[serde(default, rename = "shouldRemember")]
        pub should_remember: bool,
    }

    #[derive(Clone, serde::Serialize, serde::Deserialize, Debug, Validate)]
    pub struct RegisterForm {
        #[validate(email(message = "Invalid Email"), length(min = 4, max = 50))]
        pub email: String,
        #[validate(length(min = 4, max = 20))]
        pub username: String,
        #[validate(length(min = 4, max = 20))]
        pub password: String,
        #[validate(
            length(min = 4, max = 20),
            must_match(other = "password", message = "passwords do not match")
        )]
        #[serde(rename = "passwordRetype")]
        pub password_retype: String,
    }

    /// Creation data for a new post. `image` is the name of an already
    /// uploaded file; storing its bytes is not this crate's concern.
    #[derive(Clone, serde::Serialize, serde::Deserialize, Debug, Validate)]
    pub struct PostForm {
        #[validate(length(min = 1, max = 40))]
        pub title: String,
        #[validate(custom(function = "crate::validation::validate_image_file"))]
        pub image: Option<String>,
        #[validate(length(min = 1, max = 2000))]
        pub content: String,
    }

    #[derive(Clone, serde::Serialize, serde::Deserialize, Debug, Validate)]
    pub struct CommentForm {
        #[validate(length(min = 1, max = 400, message = "comment content of disallowed size"))]
        pub content: String,
        pub post_id: i32,
    }

    /// PostForm minus the image; a post's picture cannot be swapped after
    /// the fact.
    #[derive(Clone, serde::Serialize, serde::Deserialize, Debug, Validate)]
    pub struct EditForm {
        #[validate(length(min = 1, max = 40))]
        pub title: String,
        #[validate(length(min = 1, max = 2000))]
        pub content: String,
    }

    #[derive(Clone, serde::Serialize, Debug)]
    pub struct ValidationErrorResponse {
        pub reason: String,
        pub errors: validator::ValidationErrors,
    }

    #[derive(Clone, serde::Deserialize, serde::Serialize, Debug)]
    pub struct PostData {
        pub id: i32,
        pub author: String,
        pub title: String,
        pub content: String,
        pub date: chrono::NaiveDateTime,
        pub image_path: Option<String>,
    }

    #[derive(Clone, serde::Deserialize, serde::Serialize, Debug)]
    pub struct CommentData {
        pub id: i32,
        pub post_id: i32,
        pub author: String,
        pub content: String,
        pub date: chrono::NaiveDateTime,
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    pub struct UserDataResponse {
        pub id: i32,
        pub username: String,
        pub email: String,
    }
}

#[cfg(test)]
mod tests {
    use super::data_structures::*;
    use validator::Validate;

    fn login(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.to_owned(),
            password: password.to_owned(),
            should_remember: false,
        }
    }

    fn register() -> RegisterForm {
        RegisterForm {
            email: "user@example.com".to_owned(),
            username: "someuser".to_owned(),
            password: "hunter22".to_owned(),
            password_retype: "hunter22".to_owned(),
        }
    }

    fn post(title: &str, image: Option<&str>, content: &str) -> PostForm {
        PostForm {
            title: title.to_owned(),
            image: image.map(str::to_owned),
            content: content.to_owned(),
        }
    }

    #[test]
    fn login_username_lower_bound() {
        assert!(login("abc", "hunter22").validate().is_err());
        assert!(login("abcd", "hunter22").validate().is_ok());
    }

    #[test]
    fn login_username_upper_bound() {
        assert!(login(&"a".repeat(21), "hunter22").validate().is_err());
        assert!(login(&"a".repeat(20), "hunter22").validate().is_ok());
    }

    #[test]
    fn login_password_bounds() {
        assert!(login("abcd", "abc").validate().is_err());
        assert!(login("abcd", &"a".repeat(21)).validate().is_err());
    }

    #[test]
    fn register_rejects_malformed_email() {
        let mut form = register();
        form.email = "not-an-email".to_owned();
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn register_accepts_valid_email() {
        assert!(register().validate().is_ok());
    }

    #[test]
    fn register_rejects_mismatched_passwords() {
        let mut form = register();
        form.password_retype = "different".to_owned();
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_retype"));
    }

    #[test]
    fn post_image_extension_allow_list() {
        assert!(post("title", Some("anim.gif"), "content").validate().is_err());
        assert!(post("title", Some("photo.jpg"), "content").validate().is_ok());
        assert!(post("title", Some("photo.png"), "content").validate().is_ok());
    }

    #[test]
    fn post_image_extension_is_case_insensitive() {
        assert!(post("title", Some("photo.PNG"), "content").validate().is_ok());
    }

    #[test]
    fn post_image_is_optional() {
        assert!(post("title", None, "content").validate().is_ok());
    }

    #[test]
    fn post_title_and_content_bounds() {
        assert!(post("", None, "content").validate().is_err());
        assert!(post(&"t".repeat(41), None, "content").validate().is_err());
        assert!(post("title", None, "").validate().is_err());
        assert!(post("title", None, &"c".repeat(2001)).validate().is_err());
        assert!(post("title", None, &"c".repeat(2000)).validate().is_ok());
    }

    #[test]
    fn comment_content_bounds() {
        let comment = |content: String| CommentForm { content, post_id: 1 };
        assert!(comment(String::new()).validate().is_err());
        assert!(comment("c".repeat(401)).validate().is_err());
        assert!(comment("c".repeat(1)).validate().is_ok());
        assert!(comment("c".repeat(400)).validate().is_ok());
    }

    #[test]
    fn edit_form_bounds() {
        let edit = |title: &str, content: &str| EditForm {
            title: title.to_owned(),
            content: content.to_owned(),
        };
        assert!(edit("", "content").validate().is_err());
        assert!(edit("title", &"c".repeat(2001)).validate().is_err());
        assert!(edit("title", "content").validate().is_ok());
    }
}
