use clap::Parser;
use holorec::{correction, spectral, tilt, unwrap2d, Region};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::prelude::*;
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use ndrustfft::{ndfft_par, ndifft_par, Complex, FftHandler};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread;

#[derive(Parser)]
struct Args {
    /// Hologram to reconstruct: a .npy file containing a 2D float array,
    /// or a raster image (converted to grayscale)
    hologram: PathBuf,

    #[arg(short, long, value_name = "WxH+X+Y")]
    /// Spectral region holding the diffraction order to keep, given in
    /// pixels of the hologram's Fourier transform
    region: Region,

    #[arg(short, long, default_value_t = 5)]
    /// Number of candidate scan lines per axis for the tilt fit
    lines: usize,

    #[arg(short, long, default_value_t = 2)]
    /// Degree of the polynomial fitted to the unwrapped phase profiles
    degree: usize,

    #[arg(short, long, value_name = "FILE")]
    /// Output the reconstructed amplitude
    amplitude: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE")]
    /// Output the tilt-corrected wrapped phase
    phase: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE")]
    /// Output the tilt-corrected phase, unwrapped over the full image
    unwrapped: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE")]
    /// Output the magnitude of the filtered spectrum
    spectrum: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.amplitude.is_none()
        && args.phase.is_none()
        && args.unwrapped.is_none()
        && args.spectrum.is_none()
    {
        eprintln!("No output files specified. Exiting.");
        return Ok(());
    }

    let hologram = load_hologram(&args.hologram)?;
    let (h, w) = hologram.dim();

    println!("Loaded hologram of shape {:?}", hologram.dim());

    let mut handler_x = FftHandler::<f64>::new(w);
    let mut handler_y = FftHandler::<f64>::new(h);
    let mut temp = Array2::<Complex<f64>>::zeros((h, w));
    let mut freq = Array2::<Complex<f64>>::zeros((h, w));

    // 2D FFT of the hologram into `freq`
    let holo = hologram.mapv(|v| Complex::new(v, 0.));
    ndfft_par(&holo, &mut temp, &mut handler_x, 1);
    ndfft_par(&temp, &mut freq, &mut handler_y, 0);

    // Keep the selected diffraction order, recentered on the DC position
    let filtered = spectral::apply(freq.view(), &args.region);

    if let Some(path) = args.spectrum.as_ref() {
        filtered.mapv(|v| v.norm()).write_npy(File::create(path)?)?;
    }

    // 2D IFFT back to an image-plane complex field
    let mut field = Array2::<Complex<f64>>::zeros((h, w));
    ndifft_par(&filtered, &mut temp, &mut handler_x, 1);
    ndifft_par(&temp, &mut field, &mut handler_y, 0);

    // Estimate the residual phase ramp on both axes from the best of the
    // automatically placed scan lines
    let phase = field.mapv(|v| v.arg());
    let h_fit = tilt::auto_horizontal(phase.view(), args.lines, args.degree)?;
    let v_fit = tilt::auto_vertical(phase.view(), args.lines, args.degree)?;

    println!("Horizontal ramp fit: {:?}", h_fit);
    println!("Vertical ramp fit:   {:?}", v_fit);

    let ramp = correction::synthesize(&h_fit, &v_fit, (h, w));

    let template = "{msg} ({elapsed}) [{wide_bar:.cyan/blue}] {pos}/{len} rows ({eta})";
    let bar = ProgressBar::new(h as u64);
    let bar_clone = bar.clone();
    let bar_style = ProgressStyle::with_template(template)
        .unwrap()
        .progress_chars("#>-");

    bar.set_style(bar_style);
    bar.set_message("Correcting");

    let (tx, rx) = flume::unbounded();

    let handle = thread::spawn(move || {
        for row in rx.iter() {
            bar_clone.set_position(row as u64);
        }
    });

    for (row, (mut out, ramp)) in field
        .outer_iter_mut()
        .zip(ramp.outer_iter())
        .enumerate()
    {
        out.zip_mut_with(&ramp, |v, r| *v *= *r);
        tx.send(row).unwrap();
    }

    drop(tx);
    handle.join().unwrap();
    bar.finish();

    println!();

    if let Some(path) = args.amplitude.as_ref() {
        field.mapv(|v| v.norm()).write_npy(File::create(path)?)?;
    }

    if args.phase.is_some() || args.unwrapped.is_some() {
        let corrected = field.mapv(|v| v.arg());

        if let Some(path) = args.phase.as_ref() {
            corrected.write_npy(File::create(path)?)?;
        }

        if let Some(path) = args.unwrapped.as_ref() {
            unwrap2d::unwrap_phase(corrected.view()).write_npy(File::create(path)?)?;
        }
    }

    Ok(())
}

// Load a hologram either from a .npy array or from any raster format the
// image crate can decode, converted to grayscale intensities.
fn load_hologram(path: &Path) -> anyhow::Result<Array2<f64>> {
    if path.extension().map_or(false, |e| e == "npy") {
        return Ok(Array2::<f64>::read_npy(File::open(path)?)?);
    }

    let img = image::open(path)?.into_luma16();
    let (w, h) = img.dimensions();

    Ok(Array2::from_shape_fn((h as usize, w as usize), |(i, j)| {
        img.get_pixel(j as u32, i as u32).0[0] as f64
    }))
}
