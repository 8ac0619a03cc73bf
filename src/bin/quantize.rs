use anyhow::Result;
use clap::Parser;
use systolic_dispatch::quant::{bits_of, quantize_multiplier};

#[derive(Parser, Debug)]
#[command(name = "quantize", version, about = "Encode float scales as fixed-point (multiplier, right_shift) pairs")]
struct Args {
    /// Scales to encode
    #[arg(required = true)]
    scales: Vec<f32>,

    /// Emit one JSON object per line
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    for &scale in &args.scales {
        if !(scale.is_normal() && scale > 0.0) {
            log::warn!("scale {} is outside the encoder's domain; result is unspecified", scale);
        }
        let m = quantize_multiplier(scale);
        if args.json {
            let obj = serde_json::json!({
                "scale": scale,
                "bits": format!("{:#010x}", bits_of(scale)),
                "multiplier": m.multiplier,
                "right_shift": m.right_shift,
                "approx": m.to_f64(),
            });
            println!("{}", serde_json::to_string(&obj)?);
        } else {
            println!("scale={} multiplier={} right_shift={} approx={:e}", scale, m.multiplier, m.right_shift, m.to_f64());
        }
    }
    Ok(())
}
