use image::imageops::FilterType;
use std::{env, fs::File, io::BufWriter};
use tmc_label::{plan_size, Config, Printer, Raster, UsbSink, EPSON_VENDOR_ID};
//
// cargo run --example print_image input.jpg [output.prn]
//
// Without an output file the job goes to the printer named by PRINTER_PID and
// PRINTER_SERIAL, read from the environment or a .env file.
//

fn print_usage() {
    println!("Usage: cargo run --example print_image <IMAGE> [OUTPUT] [--cut]");
    println!("  IMAGE    any file the image crate can decode");
    println!("  OUTPUT   write the command stream to a file instead of USB");
    println!("  --cut    enable the auto cutter");
}

fn main() {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();
    dotenvy::dotenv().ok();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let cut = args.iter().any(|a| a == "--cut");
    args.retain(|a| a != "--cut");

    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        return;
    }

    let config = Config::new().auto_cutter(cut);

    let source = image::open(&args[0]).unwrap().to_rgb8();
    let (width, height) = plan_size(&config, source.width(), source.height()).unwrap();
    let scaled = image::imageops::resize(&source, width, height, FilterType::Triangle);
    let raster = Raster::from_rgb(width, height, scaled.into_raw()).unwrap();

    match args.get(1) {
        Some(output) => {
            let file = BufWriter::new(File::create(output).unwrap());
            let mut printer = Printer::new(file, config);
            match printer.print(&raster) {
                Ok(()) => println!("wrote {}", output),
                Err(err) => println!("ERROR {:#?}", err),
            }
        }
        None => {
            let pid = env::var("PRINTER_PID").expect("PRINTER_PID is not set");
            let pid = u16::from_str_radix(pid.trim_start_matches("0x"), 16).unwrap();
            let serial = env::var("PRINTER_SERIAL").expect("PRINTER_SERIAL is not set");

            match UsbSink::open(EPSON_VENDOR_ID, pid, &serial) {
                Ok(sink) => Printer::new(sink, config).print(&raster).unwrap(),
                Err(err) => println!("ERROR {:#?}", err),
            }
        }
    }
}
