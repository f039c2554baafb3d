use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use super::mac_config::{CfgClientTdma, MacConfig, SharedConfig};

/// Build `SharedConfig` from a TOML configuration string
pub fn from_toml_str(toml_str: &str) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    // Various sanity checks
    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if let Some(ref frame) = root.frame {
        if !frame.extra.is_empty() {
            return Err(format!("Unrecognized fields in frame: {:?}", sorted_keys(&frame.extra)).into());
        }
    }
    if let Some(ref clients) = root.clients {
        if !clients.extra.is_empty() {
            return Err(format!("Unrecognized fields in clients: {:?}", sorted_keys(&clients.extra)).into());
        }
    }
    if let Some(ref cd) = root.client_defaults {
        if !cd.extra.is_empty() {
            return Err(format!("Unrecognized fields in client_defaults: {:?}", sorted_keys(&cd.extra)).into());
        }
    }

    // Build config from required and optional values
    let mut cfg = MacConfig {
        debug_log: root.debug_log,
        ..Default::default()
    };

    if let Some(frame) = root.frame {
        if let Some(v) = frame.max_slots {
            cfg.frame.max_slots = v;
        }
    }
    if let Some(clients) = root.clients {
        if let Some(v) = clients.max_clients {
            cfg.clients.max_clients = v;
        }
    }
    if let Some(cd) = root.client_defaults {
        cfg.client_defaults = Some(CfgClientTdma {
            start_frame: cd.start_frame,
            packets_per_superframe: cd.packets_per_superframe,
            slots_per_packet: cd.slots_per_packet,
        });
    }

    // Report invalid values as errors rather than letting SharedConfig panic
    cfg.validate().map_err(|e| format!("Invalid configuration: {}", e))?;

    Ok(SharedConfig::from_config(cfg))
}

/// Build `SharedConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `SharedConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    let r = BufReader::new(f);
    let cfg = from_reader(r)?;
    Ok(cfg)
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,

    #[serde(default)]
    frame: Option<FrameDto>,

    #[serde(default)]
    clients: Option<ClientsDto>,

    #[serde(default)]
    client_defaults: Option<ClientTdmaDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct FrameDto {
    pub max_slots: Option<u16>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct ClientsDto {
    pub max_clients: Option<usize>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct ClientTdmaDto {
    #[serde(default)]
    pub start_frame: u16,
    pub packets_per_superframe: u8,
    pub slots_per_packet: u8,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}
