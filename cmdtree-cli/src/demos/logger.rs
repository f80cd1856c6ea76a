//! Login session demo object.

use std::sync::Mutex;

use cmdtree_core::{ContextObject, EvalError, Value};

/// A single hard-coded account and whether it is logged in
#[derive(Debug)]
pub struct Logger {
    user: String,
    password: i64,
    logged: Mutex<bool>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("Brian", 1234)
    }
}

impl Logger {
    pub fn new(user: impl Into<String>, password: i64) -> Self {
        Self {
            user: user.into(),
            password,
            logged: Mutex::new(false),
        }
    }

    fn session(&self) -> Result<std::sync::MutexGuard<'_, bool>, EvalError> {
        self.logged
            .lock()
            .map_err(|_| EvalError::object("logger session is poisoned"))
    }

    pub fn logging(&self, user: &str, password: i64) -> Result<String, EvalError> {
        let mut logged = self.session()?;
        if *logged {
            return Ok("Already logged !".to_string());
        }
        if user == self.user && password == self.password {
            *logged = true;
            return Ok(format!("You are logged in as {} !", user));
        }
        Ok("Failed to login. . .".to_string())
    }

    pub fn disconnect(&self) -> Result<String, EvalError> {
        let mut logged = self.session()?;
        if *logged {
            *logged = false;
            return Ok(format!("Disconnected from user {}", self.user));
        }
        Ok("Already disconnected !".to_string())
    }

    pub fn interact(&self, message: &str) -> Result<String, EvalError> {
        if *self.session()? {
            Ok(message.to_string())
        } else {
            Ok("You need to be logged to be able to do that :/".to_string())
        }
    }
}

impl ContextObject for Logger {
    fn type_name(&self) -> &str {
        "Logger"
    }

    fn call_method(&self, method: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        let reply = match (method, args.as_slice()) {
            ("logging", [Value::Str(user), Value::Int(password)]) => {
                self.logging(user, *password)?
            }
            ("disconnect", []) => self.disconnect()?,
            ("interact", [message]) => self.interact(&message.to_string())?,
            ("logging" | "disconnect" | "interact", _) => {
                return Err(EvalError::type_error(format!(
                    "bad arguments for Logger.{}()",
                    method
                )))
            }
            _ => {
                return Err(EvalError::UnknownAttribute {
                    owner: self.type_name().to_string(),
                    name: method.to_string(),
                })
            }
        };
        Ok(Value::Str(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_flow() {
        let logger = Logger::default();
        assert_eq!(
            logger.interact("hi").unwrap(),
            "You need to be logged to be able to do that :/"
        );
        assert_eq!(logger.logging("Brian", 1).unwrap(), "Failed to login. . .");
        assert_eq!(logger.logging("Brian", 1234).unwrap(), "You are logged in as Brian !");
        assert_eq!(logger.logging("Brian", 1234).unwrap(), "Already logged !");
        assert_eq!(logger.interact("hi").unwrap(), "hi");
        assert_eq!(logger.disconnect().unwrap(), "Disconnected from user Brian");
        assert_eq!(logger.disconnect().unwrap(), "Already disconnected !");
    }

    #[test]
    fn test_method_dispatch() {
        let logger = Logger::default();
        let reply = logger
            .call_method("logging", vec![Value::from("Brian"), Value::Int(1234)])
            .unwrap();
        assert_eq!(reply, Value::from("You are logged in as Brian !"));
        assert!(logger.call_method("logging", vec![Value::from("Brian")]).is_err());
    }
}
