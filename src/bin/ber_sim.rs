//! Bit-error-rate simulation over a binary symmetric channel.
//!
//! Usage: `ber_sim [crossover_probability] [frames] [seed]`

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use viterbi_fec::code::SUPPORTED_CONSTRAINT_LENGTHS;
use viterbi_fec::prbs::Prbs7;
use viterbi_fec::{encode, CodeParams, Error, Result, ViterbiDecoder, MAX_FRAME};

struct Settings {
    crossover: f64,
    frames: usize,
    seed: u64,
}

fn parse_arg<T: std::str::FromStr>(arg: Option<String>, name: &str, default: T) -> Result<T> {
    match arg {
        Some(value) => value
            .parse()
            .map_err(|_| Error::InvalidInput(format!("invalid {}: {}", name, value))),
        None => Ok(default),
    }
}

fn parse_settings() -> Result<Settings> {
    let mut args = std::env::args().skip(1);
    let settings = Settings {
        crossover: parse_arg(args.next(), "crossover probability", 0.03)?,
        frames: parse_arg(args.next(), "frame count", 2000)?,
        seed: parse_arg(args.next(), "seed", 42)?,
    };
    if !(0.0..=1.0).contains(&settings.crossover) {
        return Err(Error::InvalidInput(format!(
            "crossover probability {} outside [0, 1]",
            settings.crossover
        )));
    }
    Ok(settings)
}

fn simulate(params: CodeParams, settings: &Settings) -> Result<(usize, usize, usize)> {
    let mut rng = ChaCha20Rng::seed_from_u64(settings.seed);
    let mut source = Prbs7::new();
    let mut decoder = ViterbiDecoder::with_params(params)?;
    let data_bits = params.max_data_bits(MAX_FRAME);

    let mut bit_errors = 0;
    let mut channel_errors = 0;
    for _ in 0..settings.frames {
        let bits: Vec<bool> = source.by_ref().take(data_bits).collect();
        let symbols = encode(&params, &bits)
            .into_iter()
            .map(|symbol| {
                let mut noisy = symbol;
                for bit in 0..2 {
                    if rng.gen_bool(settings.crossover) {
                        noisy = noisy.flipped(bit);
                        channel_errors += 1;
                    }
                }
                noisy
            })
            .collect::<Vec<_>>();

        let decoded = decoder.decode_frame(&symbols)?;
        bit_errors += decoded.iter().zip(&bits).filter(|(a, b)| a != b).count();
    }

    Ok((bit_errors, channel_errors, settings.frames * data_bits))
}

fn main() -> Result<()> {
    let settings = parse_settings()?;
    println!(
        "BSC p = {}, {} frames of {} symbols, seed {}",
        settings.crossover, settings.frames, MAX_FRAME, settings.seed
    );

    for &k in SUPPORTED_CONSTRAINT_LENGTHS.iter() {
        let params = CodeParams::preset(k)?;
        let (bit_errors, channel_errors, total_bits) = simulate(params, &settings)?;
        let channel_bits = settings.frames * MAX_FRAME * 2;
        println!(
            "K={}: channel BER {:.3e}, decoded BER {:.3e} ({} / {} bits)",
            k,
            channel_errors as f64 / channel_bits as f64,
            bit_errors as f64 / total_bits as f64,
            bit_errors,
            total_bits
        );
    }
    Ok(())
}
