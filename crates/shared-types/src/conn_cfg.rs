//! # Connection Configuration
//!
//! Base envelope for driver connection settings plus the two connection
//! kinds drivers share. A concrete config writes the base envelope first and
//! then its own envelope:
//!
//! ```text
//! [Start | 1 | End]  [Start | ver | fields | End]
//!  ConnCfgBase        IpConnCfg / SerialConnCfg
//! ```

use crate::envelope::{read_header, read_trailer, write_header, write_trailer, Persistable};
use crate::errors::FormatError;
use crate::stream::{BinInStream, BinOutStream};

/// Base connection config. Carries no fields of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnCfgBase;

impl Persistable for ConnCfgBase {
    const TYPE_NAME: &'static str = "ConnCfg";
    const FORMAT_VERSION: u16 = 1;

    fn encode(&self, out: &mut BinOutStream) -> Result<(), FormatError> {
        write_header::<Self>(out);
        write_trailer(out);
        Ok(())
    }

    fn decode(input: &mut BinInStream<'_>) -> Result<Self, FormatError> {
        read_header::<Self>(input)?;
        read_trailer(input)?;
        Ok(Self)
    }

    fn reset(&mut self) {}
}

/// TCP/IP connection to a device or controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpConnCfg {
    pub host: String,
    pub port: u16,
}

impl IpConnCfg {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Human readable endpoint for diagnostics.
    pub fn describe(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for IpConnCfg {
    fn default() -> Self {
        Self::new("localhost", 0)
    }
}

impl Persistable for IpConnCfg {
    const TYPE_NAME: &'static str = "IpConnCfg";
    const FORMAT_VERSION: u16 = 1;

    fn encode(&self, out: &mut BinOutStream) -> Result<(), FormatError> {
        ConnCfgBase.encode(out)?;
        write_header::<Self>(out);
        out.write_str(&self.host)?;
        out.write_u16(self.port);
        write_trailer(out);
        Ok(())
    }

    fn decode(input: &mut BinInStream<'_>) -> Result<Self, FormatError> {
        ConnCfgBase::decode(input)?;
        read_header::<Self>(input)?;
        let host = input.read_string()?;
        let port = input.read_u16()?;
        read_trailer(input)?;
        Ok(Self { host, port })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Serial parity setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

impl Parity {
    fn to_u8(self) -> u8 {
        match self {
            Parity::None => 0,
            Parity::Odd => 1,
            Parity::Even => 2,
        }
    }

    fn from_u8(raw: u8) -> Result<Self, FormatError> {
        match raw {
            0 => Ok(Parity::None),
            1 => Ok(Parity::Odd),
            2 => Ok(Parity::Even),
            other => Err(FormatError::InvalidValue {
                field: "parity",
                value: u64::from(other),
            }),
        }
    }
}

/// Serial port connection.
///
/// Version 2 added `flow_control`; version 1 streams load with it off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConnCfg {
    pub port_name: String,
    pub baud: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: u8,
    pub flow_control: bool,
}

impl SerialConnCfg {
    pub fn new(port_name: impl Into<String>, baud: u32) -> Self {
        Self {
            port_name: port_name.into(),
            baud,
            ..Self::default()
        }
    }

    pub fn describe(&self) -> String {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Odd => 'O',
            Parity::Even => 'E',
        };
        format!(
            "{} {} {}{}{}",
            self.port_name, self.baud, self.data_bits, parity, self.stop_bits
        )
    }
}

impl Default for SerialConnCfg {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud: 9600,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            flow_control: false,
        }
    }
}

impl Persistable for SerialConnCfg {
    const TYPE_NAME: &'static str = "SerialConnCfg";
    const FORMAT_VERSION: u16 = 2;

    fn encode(&self, out: &mut BinOutStream) -> Result<(), FormatError> {
        ConnCfgBase.encode(out)?;
        write_header::<Self>(out);
        out.write_str(&self.port_name)?;
        out.write_u32(self.baud);
        out.write_u8(self.data_bits);
        out.write_u8(self.parity.to_u8());
        out.write_u8(self.stop_bits);
        out.write_bool(self.flow_control);
        write_trailer(out);
        Ok(())
    }

    fn decode(input: &mut BinInStream<'_>) -> Result<Self, FormatError> {
        ConnCfgBase::decode(input)?;
        let version = read_header::<Self>(input)?;
        let port_name = input.read_string()?;
        let baud = input.read_u32()?;
        let data_bits = input.read_u8()?;
        let parity = Parity::from_u8(input.read_u8()?)?;
        let stop_bits = input.read_u8()?;
        let flow_control = if version >= 2 {
            input.read_bool()?
        } else {
            false
        };
        read_trailer(input)?;
        Ok(Self {
            port_name,
            baud,
            data_bits,
            parity,
            stop_bits,
            flow_control,
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
