use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;
use fieldguide_lib::config::UNKNOWN_SPECIES;
use fieldguide_lib::inference::client::InferenceClient;
use fieldguide_lib::output::ConsoleIO;
use fieldguide_lib::runtime::Runtime;

/// Image path that means "read the image from stdin".
const STDIN_PATH: &str = "-";

/// Run the `fieldguide identify` command.
///
/// API failures are reported on stdout followed by the "Unknown Species"
/// placeholder; the command itself still succeeds.
pub fn run_identify<IN, OUT, ERR>(
    image: &Path,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: Read,
    OUT: Write,
    ERR: Write,
{
    let api = runtime.api()?;
    let bytes = read_image(image, io)?;

    let client = InferenceClient::new(api.clone());
    match client.identify_species(&bytes) {
        Ok(label) => writeln!(io.stdout(), "{label}")?,
        Err(failure) => {
            writeln!(io.stdout(), "{failure}")?;
            writeln!(io.stdout(), "{UNKNOWN_SPECIES}")?;
        }
    }
    Ok(())
}

fn read_image<IN, OUT, ERR>(
    image: &Path,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<Vec<u8>>
where
    IN: Read,
    OUT: Write,
    ERR: Write,
{
    if image == Path::new(STDIN_PATH) {
        let mut bytes = Vec::new();
        io.stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read image from stdin")?;
        return Ok(bytes);
    }
    std::fs::read(image).with_context(|| format!("Failed to read image {}", image.display()))
}
