use validator::ValidateEmail;

#[derive(Debug, Clone)]
pub struct CustomerEmail(pub String);

impl CustomerEmail {
    pub fn parse(email: String) -> Result<CustomerEmail, String>{
        if email.validate_email(){
            Ok(Self(email))
        } else {
            Err(format!("{} is not a valid email address", email))
        }
    }

    pub fn inner(&self) -> String {
        self.0.clone()
    }
}

impl std::fmt::Display for CustomerEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
