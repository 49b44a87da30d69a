use std::fs::File;
use std::io::{Read, Write, stdin, stdout};
use std::path::Path;

use anyhow::{Context, bail};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use gemspatch::bitfield::{
    Layout, REG_B0, REG_B4, REG22, REG27, REG28, REG30, REG40, REG50, REG60, REG70, REG80, REG90,
};
use gemspatch::format::dmp::{DMP_VERSION_0, DMP_VERSION_5};
use gemspatch::{Format, GemsPatch, GemsPsg, RawInstrument};
use tracing::debug;

/// Read patch bytes from a path or stdin ('-') into a Vec<u8>.
pub fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut out = Vec::new();
    if path == Path::new("-") {
        stdin()
            .read_to_end(&mut out)
            .context("failed to read from stdin")?;
    } else {
        let mut f = File::open(path)
            .with_context(|| format!("failed to open input file: {}", path.display()))?;
        f.read_to_end(&mut out)
            .context("failed to read input file")?;
    }
    Ok(out)
}

/// Write `bytes` to a path or stdout ('-').
fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if path == Path::new("-") {
        let mut handle = stdout();
        handle
            .write_all(bytes)
            .and_then(|_| handle.flush())
            .context("failed to write to stdout")?;
    } else {
        let mut f = File::create(path)
            .with_context(|| format!("failed to create output file: {}", path.display()))?;
        f.write_all(bytes)
            .with_context(|| format!("failed to write output file: {}", path.display()))?;
    }
    Ok(())
}

/// Format named by the file extension (`patch.tfi` -> TFI), if any.
fn format_from_extension(path: &Path) -> Option<Format> {
    path.extension()
        .and_then(|s| s.to_str())
        .and_then(Format::by_name)
}

/// Both DMP versions share the `.dmp` extension; the version byte picks the
/// variant so that export writes the same version back.
fn dmp_variant(format: Format, data: &[u8]) -> Format {
    match (format, data.first()) {
        (Format::Dmp | Format::Dmp0, Some(&DMP_VERSION_0)) => Format::Dmp0,
        (Format::Dmp | Format::Dmp0, Some(&DMP_VERSION_5)) => Format::Dmp,
        _ => format,
    }
}

/// Pick the format of `path`: the explicit choice, then the extension,
/// then the buffer length when the contents are given.
fn resolve_format(
    path: &Path,
    explicit: Option<Format>,
    data: Option<&[u8]>,
    flag: &str,
) -> anyhow::Result<Format> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    if let Some(format) = format_from_extension(path) {
        let format = data.map_or(format, |data| dmp_variant(format, data));
        debug!("{}: format {} from extension", path.display(), format);
        return Ok(format);
    }
    if let Some(format) = data.and_then(|data| Format::from_size(data.len())) {
        debug!("{}: format {} from size", path.display(), format);
        return Ok(format);
    }
    bail!(
        "cannot tell the format of {}; pass --{} NAME",
        path.display(),
        flag
    )
}

/// Output format for `convert`. A `.dmp` output keeps the version of a DMP
/// input unless `--to` says otherwise.
fn resolve_output_format(
    output: &Path,
    explicit: Option<Format>,
    from: Format,
) -> anyhow::Result<Format> {
    let to = resolve_format(output, explicit, None, "to")?;
    Ok(match (explicit, from, to) {
        (None, Format::Dmp0, Format::Dmp) => Format::Dmp0,
        _ => to,
    })
}

fn display_name(path: &Path) -> String {
    match path.canonicalize() {
        Ok(p) => p.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// One row per named field of `layout`, one column per operator.
fn operator_rows<const N: usize>(table: &mut Table, layout: &Layout<N>, regs: [u8; 4]) {
    let values = regs.map(|reg| layout.unpack(reg));
    for (i, field) in layout.fields.iter().enumerate() {
        if field.name.starts_with("unk") {
            continue;
        }
        let mut row = vec![Cell::new(layout.name), Cell::new(field.name)];
        row.extend(values.iter().map(|v| Cell::new(v[i])));
        table.add_row(row);
    }
}

fn channel_rows<const N: usize>(table: &mut Table, layout: &Layout<N>, reg: u8) {
    for (field, value) in layout.fields.iter().zip(layout.unpack(reg)) {
        if field.name.starts_with("unk") || field.name == "CH" {
            continue;
        }
        table.add_row(vec![
            Cell::new(layout.name),
            Cell::new(field.name),
            Cell::new(value),
        ]);
    }
}

fn display_instrument(inst: &RawInstrument) {
    let mut channel = new_table();
    channel.set_header(vec!["Register", "Field", "Value"]);
    channel_rows(&mut channel, &REG_B0, inst.reg_b0);
    channel_rows(&mut channel, &REG_B4, inst.reg_b4);
    channel_rows(&mut channel, &REG22, inst.reg22);
    channel_rows(&mut channel, &REG27, inst.reg27);
    channel_rows(&mut channel, &REG28, inst.reg28);
    println!("{channel}");

    let mut ops = new_table();
    ops.set_header(vec!["Register", "Field", "OP1", "OP2", "OP3", "OP4"]);
    operator_rows(&mut ops, &REG30, inst.op.map(|op| op.reg30));
    operator_rows(&mut ops, &REG40, inst.op.map(|op| op.reg40));
    operator_rows(&mut ops, &REG50, inst.op.map(|op| op.reg50));
    operator_rows(&mut ops, &REG60, inst.op.map(|op| op.reg60));
    operator_rows(&mut ops, &REG70, inst.op.map(|op| op.reg70));
    operator_rows(&mut ops, &REG80, inst.op.map(|op| op.reg80));
    operator_rows(&mut ops, &REG90, inst.op.map(|op| op.reg90));
    ops.add_row(ch3_row(inst));
    println!("{ops}");
}

/// Channel 3 frequencies in slot order (registers A9, AA, A8, A2).
fn ch3_row(inst: &RawInstrument) -> Vec<String> {
    let mut row = vec!["CH3".to_string(), "freq".to_string()];
    row.extend(inst.ch3_freq.iter().map(|f| format!("0x{:04X}", f)));
    row
}

fn display_psg(noise: bool, psg: &GemsPsg) {
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["type", if noise { "noise" } else { "tone" }]);
    for (name, value) in [
        ("ND", psg.nd),
        ("AR", psg.ar),
        ("SL", psg.sl),
        ("AL", psg.al),
        ("DR", psg.dr),
        ("RR", psg.rr),
    ] {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    println!("{table}");
}

/// Print the format registry.
pub fn formats() {
    let mut table = new_table();
    table.set_header(vec!["Id", "Name", "Size"]);
    for format in Format::ALL {
        table.add_row(vec![
            Cell::new(format.id()),
            Cell::new(format.name()),
            Cell::new(format.size()),
        ]);
    }
    println!("{table}");
}

/// Info command: import the file and print its registers field by field.
///
/// GEMS PSG patches have no FM registers; their envelope is printed instead.
pub fn info(path: &Path, data: Vec<u8>, format: Option<Format>) -> anyhow::Result<()> {
    let format = resolve_format(path, format, Some(data.as_slice()), "format")?;
    let file_str = display_name(path);

    if format == Format::Gems {
        match GemsPatch::decode(&data) {
            Ok(GemsPatch::Psg { noise, psg }) => {
                println!("\"{}\": GEMS PSG patch", file_str);
                display_psg(noise, &psg);
                return Ok(());
            }
            Ok(GemsPatch::Fm(_)) => {}
            Err(e) => {
                eprintln!("\"{}\": parse error: {}", file_str, e);
                return Ok(());
            }
        }
    }

    let inst = match RawInstrument::import(format, &data) {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("\"{}\": parse error: {}", file_str, e);
            return Ok(());
        }
    };
    println!("\"{}\": {} ({} bytes)", file_str, format, data.len());
    display_instrument(&inst);
    Ok(())
}

/// Convert command: import `data` and write it to `output` in another format.
pub fn convert(
    input: &Path,
    data: Vec<u8>,
    output: &Path,
    from: Option<Format>,
    to: Option<Format>,
) -> anyhow::Result<()> {
    let from = resolve_format(input, from, Some(data.as_slice()), "from")?;
    let to = resolve_output_format(output, to, from)?;
    let bytes = gemspatch::convert(from, to, &data)
        .with_context(|| format!("failed to read {} as {}", input.display(), from))?;
    write_output(output, &bytes)?;
    tracing::info!("{} -> {} ({} bytes)", from, to, bytes.len());
    Ok(())
}

/// Offsets at which `a` and `b` differ, over the shorter length.
fn diff_offsets(a: &[u8], b: &[u8]) -> Vec<usize> {
    a.iter()
        .zip(b)
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(i, _)| i)
        .collect()
}

/// Print a side-by-side hexdump of original vs rebuilt bytes, marking the
/// lines that differ.
fn print_hexdiff(orig: &[u8], rebuilt: &[u8], bytes_per_line: usize) {
    let maxlen = orig.len().max(rebuilt.len());
    println!("\nHexdump (original | rebuilt):\n");
    for off in (0..maxlen).step_by(bytes_per_line) {
        let hex = |data: &[u8]| -> String {
            (off..off + bytes_per_line)
                .map(|i| match data.get(i) {
                    Some(b) => format!("{:02X} ", b),
                    None => "   ".to_string(),
                })
                .collect()
        };
        let end = (off + bytes_per_line).min(maxlen);
        let marker = if orig.get(off..end) == rebuilt.get(off..end) {
            ' '
        } else {
            '*'
        };
        println!("{} 0x{:04X}: {}| {}", marker, off, hex(orig), hex(rebuilt));
    }
    println!();
}

/// Test command: import, export and compare against the input bytes.
///
/// Trailing bytes past the format size are not compared.
pub fn test_roundtrip(
    path: &Path,
    data: Vec<u8>,
    format: Option<Format>,
    diag: bool,
) -> anyhow::Result<()> {
    let format = resolve_format(path, format, Some(data.as_slice()), "format")?;
    let file_str = display_name(path);

    let inst = match RawInstrument::import(format, &data) {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("\"{}\": parse error: {}", file_str, e);
            return Ok(());
        }
    };
    let rebuilt = inst.export(format);
    let original = &data[..rebuilt.len().min(data.len())];
    let diffs = diff_offsets(original, &rebuilt);

    if diffs.is_empty() {
        println!("\"{}\": {} roundtrip OK", file_str, format);
    } else {
        let offsets: Vec<String> = diffs.iter().map(|o| format!("0x{:02X}", o)).collect();
        println!(
            "\"{}\": {} roundtrip MISMATCH at {} byte(s): {}",
            file_str,
            format,
            diffs.len(),
            offsets.join(", ")
        );
        if diag {
            print_hexdiff(original, &rebuilt, 16);
        }
    }
    Ok(())
}
