use std::fmt::Debug;

use phonenumber::country;

#[derive(Debug, Clone)]
pub struct CustomerPhone(pub String);

impl CustomerPhone{
    pub fn parse(number: String) -> Result<CustomerPhone, String>{
        if phonenumber::parse(Some(country::EG), number.clone()).is_ok(){
            Ok(Self(number))
        } else {
            Err(format!("{} is not a valid phone number", number))
        }
    }

    pub fn inner(&self) -> String {
        self.0.clone()
    }

    // The forgot-password flow verifies identity against these digits
    pub fn last_four(&self) -> String {
        let digits: String = self.0.chars().filter(|c| c.is_ascii_digit()).collect();
        digits.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect()
    }
}

impl std::fmt::Display for CustomerPhone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
