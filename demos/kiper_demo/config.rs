//! Configuration structs for the kiper demo application.
//!
//! The root [`DemoConfig`] holds a few top-level fields plus two groups,
//! [`ServerConfig`] and [`DisplayConfig`], so nested flags, file sections and
//! env vars can all be tried out.
//!
//! # Env var mapping
//!
//! With the prefix `KIPER_DEMO`:
//!
//! | Env var                         | Config key             |
//! |---------------------------------|------------------------|
//! | `KIPER_DEMO_NAME`               | `name`                 |
//! | `KIPER_DEMO_SERVER_ADDRESS`     | `server.address`       |
//! | `KIPER_DEMO_SERVER_PORT`        | `server.port`          |
//! | `KIPER_DEMO_SERVER_MAX_CONNECTIONS` | `server.max_connections` |
//! | `KIPER_DEMO_DISPLAY_COLOR`      | `display.color`        |
//! | `KIPER_DEMO_DISPLAY_TAGS`       | `display.tags`         |

use std::net::IpAddr;

use kiper::{KiperConfig, KiperError, KiperValue, Slot, ValueError, Visitor};

/// An IP address, validated on every assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Address(pub IpAddr);

impl Default for Address {
    fn default() -> Self {
        Self(IpAddr::from([127, 0, 0, 1]))
    }
}

impl KiperValue for Address {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        self.0 = text.parse()?;
        Ok(())
    }

    fn render(&self) -> String {
        self.0.to_string()
    }
}

/// A TCP port. Zero is rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Port(pub u16);

impl KiperValue for Port {
    fn set(&mut self, text: &str) -> Result<(), ValueError> {
        let port: u16 = text.parse()?;
        if port == 0 {
            return Err("port must be non-zero".into());
        }
        self.0 = port;
        Ok(())
    }

    fn render(&self) -> String {
        self.0.to_string()
    }
}

#[derive(Debug, Default)]
pub struct DemoConfig {
    /// Application name shown in the banner.
    pub name: String,
    /// Print debug logs from the merge.
    pub verbose: bool,
    /// Print only this dotted key.
    pub key: Option<String>,
    pub server: ServerConfig,
    pub display: DisplayConfig,
}

impl KiperConfig for DemoConfig {
    fn visit(&mut self, v: &mut dyn Visitor) -> Result<(), KiperError> {
        v.value(
            "name:name;help:application name shown in the banner;default:kiper-demo",
            Slot::from(&mut self.name),
        )?;
        v.value(
            "name:verbose;help:print debug logs from the merge;default:false",
            Slot::from(&mut self.verbose),
        )?;
        v.value("name:key;help:print only this dotted key", Slot::from(&mut self.key))?;
        v.group("name:server", &mut self.server)?;
        v.group("name:display", &mut self.display)
    }
}

#[derive(Debug, Default)]
pub struct ServerConfig {
    pub address: Address,
    pub port: Port,
    pub max_connections: u32,
}

impl KiperConfig for ServerConfig {
    fn visit(&mut self, v: &mut dyn Visitor) -> Result<(), KiperError> {
        v.value(
            "name:address;help:address to bind to",
            Slot::custom(&mut self.address),
        )?;
        v.value("name:port;help:port to listen on;default:3000", Slot::custom(&mut self.port))?;
        v.value(
            "name:max-connections;help:maximum number of connections;default:100",
            Slot::from(&mut self.max_connections),
        )
    }
}

#[derive(Debug, Default)]
pub struct DisplayConfig {
    /// Supported values: red, green, yellow, blue, magenta, cyan, white.
    pub color: String,
    pub tags: Vec<String>,
}

impl KiperConfig for DisplayConfig {
    fn visit(&mut self, v: &mut dyn Visitor) -> Result<(), KiperError> {
        v.value(
            "name:color;help:terminal color for the output;default:yellow",
            Slot::from(&mut self.color),
        )?;
        v.value("name:tags;help:labels printed under the banner", Slot::from(&mut self.tags))
    }
}
