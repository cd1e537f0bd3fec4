use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serialid_transport::{list_ports, PortInfo};

use crate::cmd::PortsArgs;
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize, Debug, PartialEq)]
struct PortOutput {
    name: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    usb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    serial_number: Option<String>,
}

impl From<PortInfo> for PortOutput {
    fn from(info: PortInfo) -> Self {
        let usb_id = match (info.vid, info.pid) {
            (Some(vid), Some(pid)) => Some(format!("{vid:04x}:{pid:04x}")),
            _ => None,
        };
        Self {
            name: info.name,
            kind: info.kind,
            usb_id,
            manufacturer: info.manufacturer,
            product: info.product,
            serial_number: info.serial_number,
        }
    }
}

pub fn run(_args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let ports: Vec<PortOutput> = list_ports()
        .map_err(|err| transport_error("port enumeration failed", err))?
        .into_iter()
        .map(PortOutput::from)
        .collect();

    print_ports(&ports, format);
    Ok(SUCCESS)
}

fn print_ports(ports: &[PortOutput], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(ports).unwrap_or_else(|_| "[]".to_string())
        ),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "TYPE", "USB ID", "PRODUCT", "SERIAL"]);
            for port in ports {
                table.add_row(vec![
                    port.name.clone(),
                    port.kind.to_string(),
                    port.usb_id.clone().unwrap_or_default(),
                    port.product.clone().unwrap_or_default(),
                    port.serial_number.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for port in ports {
                match (&port.usb_id, &port.product) {
                    (Some(id), Some(product)) => {
                        println!("{} ({}, {id}, {product})", port.name, port.kind)
                    }
                    (Some(id), None) => println!("{} ({}, {id})", port.name, port.kind),
                    _ => println!("{} ({})", port.name, port.kind),
                }
            }
        }
        OutputFormat::Raw => {
            for port in ports {
                println!("{}", port.name);
            }
        }
    }
}
