use image::{imageops::FilterType, Rgb};
use qrcode::QrCode;
use std::{fs::File, io::BufWriter};
use tmc_label::{plan_size, Config, Margins, Printer, Raster};
//
// cargo run --example print_qr "some text" qr.prn
//

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("usage: print_qr <text> <output.prn>");
        return;
    }

    let config = Config::new()
        .margins(Margins {
            bottom: 5.0,
            ..Margins::default()
        })
        .auto_cutter(true);

    let qrcode = QrCode::new(args[1].as_bytes()).unwrap();
    let code = qrcode
        .render::<Rgb<u8>>()
        .dark_color(Rgb([0x00, 0x38, 0xA8]))
        .quiet_zone(true)
        .min_dimensions(200, 200)
        .build();

    // dots are twice as tall as wide, nearest keeps the modules sharp
    let (width, height) = plan_size(&config, code.width(), code.height()).unwrap();
    let scaled = image::imageops::resize(&code, width, height, FilterType::Nearest);
    let raster = Raster::from_rgb(width, height, scaled.into_raw()).unwrap();

    let file = BufWriter::new(File::create(&args[2]).unwrap());
    let mut printer = Printer::new(file, config);
    match printer.print(&raster) {
        Ok(()) => println!("wrote {}", args[2]),
        Err(err) => println!("ERROR {:#?}", err),
    }
}
