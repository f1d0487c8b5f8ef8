#[cfg(test)]
pub mod test {
    use crate::config::{KiperConfig, Visitor};
    use crate::custom::{KiperValue, ValueError};
    use crate::error::KiperError;
    use crate::slot::Slot;

    /// Accepts any non-empty text.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Address(pub String);

    impl KiperValue for Address {
        fn set(&mut self, text: &str) -> Result<(), ValueError> {
            if text.is_empty() {
                return Err("address can't be empty".into());
            }
            self.0 = text.to_string();
            Ok(())
        }

        fn render(&self) -> String {
            self.0.clone()
        }
    }

    /// Accepts text that parses as an integer.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Port(pub String);

    impl KiperValue for Port {
        fn set(&mut self, text: &str) -> Result<(), ValueError> {
            if text.parse::<i64>().is_err() {
                return Err("not a valid port value".into());
            }
            self.0 = text.to_string();
            Ok(())
        }

        fn render(&self) -> String {
            self.0.clone()
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TestConfig {
        pub address: Address,
        pub port: Port,
        pub name: Option<String>,
        pub debug: bool,
        pub tags: Vec<String>,
        pub server: ServerConfig,
    }

    impl KiperConfig for TestConfig {
        fn visit(&mut self, v: &mut dyn Visitor) -> Result<(), KiperError> {
            v.value(
                "name:address;help:address of server;default:127.0.0.1",
                Slot::custom(&mut self.address),
            )?;
            v.value("name:port;default:3306", Slot::custom(&mut self.port))?;
            v.value("name:name;help:display name", (&mut self.name).into())?;
            v.value("name:debug;default:false", (&mut self.debug).into())?;
            v.value("name:tags;default:a, b", (&mut self.tags).into())?;
            v.group("name:server", &mut self.server)
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ServerConfig {
        pub host: Address,
        pub timeout: i32,
        pub retries: i64,
    }

    impl KiperConfig for ServerConfig {
        fn visit(&mut self, v: &mut dyn Visitor) -> Result<(), KiperError> {
            v.value("name:host", Slot::custom(&mut self.host))?;
            v.value("name:timeout;default:30", (&mut self.timeout).into())?;
            v.value("name:retries;default:3", (&mut self.retries).into())
        }
    }
}
