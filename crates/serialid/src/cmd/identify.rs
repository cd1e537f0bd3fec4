use std::path::Path;

use bytes::BytesMut;
use serialid_session::{decode_record, decompress, Device, IdentityRecord, SessionConfig};
use serialid_transport::{SerialConfig, SerialTransport, Transport};
use tracing::{debug, info};

use crate::cmd::{parse_duration, IdentifyArgs};
use crate::exit::{io_error, session_error, transport_error, CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat};

/// Everything read from the device in one identification pass.
#[derive(Debug)]
pub struct Identification {
    pub image: BytesMut,
    pub inflated: Vec<u8>,
    pub record: IdentityRecord,
}

pub fn run(args: IdentifyArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let serial = SerialConfig {
        path: args.port.clone(),
        baud_rate: args.baud,
        timeout,
    };
    let session = SessionConfig {
        chunk_size: args.chunk_size,
        reply_sequence: args.reply_sequence.into(),
    };

    let transport =
        SerialTransport::open(&serial).map_err(|err| transport_error("open failed", err))?;
    let mut device = Device::with_config(transport, session);
    let ident = identify_device(&mut device, args.dump_image.as_deref())?;

    let port = args.port.display().to_string();
    info!(port = %port, image = ident.image.len(), "device identified");
    print_record(
        &ident.record,
        &ident.inflated,
        &port,
        ident.image.len(),
        format,
    );
    Ok(SUCCESS)
}

/// Run the paged read on `device`, optionally saving the compressed image.
pub fn identify_device<T: Transport>(
    device: &mut Device<T>,
    dump_image: Option<&Path>,
) -> CliResult<Identification> {
    let image = device
        .read_image()
        .map_err(|err| session_error("identify failed", err))?;

    if let Some(path) = dump_image {
        std::fs::write(path, &image)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?;
        debug!(path = %path.display(), bytes = image.len(), "image written");
    }

    let inflated = decompress(&image).map_err(|err| session_error("identify failed", err))?;
    let record =
        decode_record(&inflated).map_err(|err| session_error("identify failed", err))?;

    Ok(Identification {
        image,
        inflated,
        record,
    })
}
