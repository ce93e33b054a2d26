use once_cell::sync::Lazy;
use regex::Regex;

// Local part and domain labels, no consecutive dots, TLD of 2+ letters.
pub(crate) static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
	Regex::new(
		r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
	)
	.expect("email pattern is valid")
});
