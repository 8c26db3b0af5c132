use crate::error::{Error, Result};

pub const DEFAULT_GREETING: &str =
    "You have reached {firstname} {lastname}. Please leave a message after the tone.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    FirstName,
    LastName,
}

/// A greeting with `{firstname}` and `{lastname}` placeholders. `{{` and `}}`
/// produce literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingTemplate {
    segments: Vec<Segment>,
}

impl GreetingTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => name.push(c),
                            None => {
                                return Err(Error::configuration(format!(
                                    "unclosed placeholder in greeting template {:?}",
                                    template
                                )))
                            }
                        }
                    }
                    let segment = match name.as_str() {
                        "firstname" => Segment::FirstName,
                        "lastname" => Segment::LastName,
                        other => {
                            return Err(Error::configuration(format!(
                                "unknown placeholder {{{}}} in greeting template; \
                                 only {{firstname}} and {{lastname}} are supported",
                                other
                            )))
                        }
                    };
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                }
                '}' => {
                    return Err(Error::configuration(format!(
                        "single '}}' in greeting template {:?}; use '}}}}' for a literal brace",
                        template
                    )))
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(GreetingTemplate { segments })
    }

    pub fn render(&self, first_name: &str, last_name: &str) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.as_str(),
                Segment::FirstName => first_name,
                Segment::LastName => last_name,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_default_greeting() {
        let template = GreetingTemplate::parse(DEFAULT_GREETING).unwrap();
        assert_eq!(
            template.render("John", "Doe"),
            "You have reached John Doe. Please leave a message after the tone."
        );
    }

    #[test]
    fn names_are_inserted_verbatim() {
        let template = GreetingTemplate::parse("Hi, this is {firstname}. Leave a message.").unwrap();
        assert_eq!(
            template.render("{lastname} O'Brien", "x"),
            "Hi, this is {lastname} O'Brien. Leave a message."
        );
    }

    #[test]
    fn placeholders_can_repeat_and_reorder() {
        let template = GreetingTemplate::parse("{lastname}, {firstname} {lastname}").unwrap();
        assert_eq!(template.render("James", "Bond"), "Bond, James Bond");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let template = GreetingTemplate::parse("{{office}} {firstname}}}").unwrap();
        assert_eq!(template.render("Ann", "Lee"), "{office} Ann}");
    }

    #[test]
    fn template_without_placeholders_is_accepted() {
        let template = GreetingTemplate::parse("Please leave a message.").unwrap();
        assert_eq!(template.render("Ann", "Lee"), "Please leave a message.");
    }

    #[test]
    fn unknown_placeholder_is_a_configuration_error() {
        let err = GreetingTemplate::parse("You have reached {name}.").unwrap_err();
        match err {
            Error::Configuration { message } => assert!(message.contains("{name}")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn malformed_braces_are_rejected() {
        assert!(matches!(
            GreetingTemplate::parse("Hello {firstname"),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            GreetingTemplate::parse("Hello } there"),
            Err(Error::Configuration { .. })
        ));
    }
}
