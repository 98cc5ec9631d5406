//! Command line interface

use clap::Parser;
use std::path::PathBuf;

/// ImgOverlay - pin reference images on top of every other window
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "imgoverlay")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Images to load on startup
    #[arg(value_name = "IMAGE")]
    pub images: Vec<PathBuf>,

    /// Start with the overlay locked (click-through)
    #[arg(short, long)]
    pub locked: bool,

    /// Let the OS move the overlay back on-screen
    #[arg(long)]
    pub no_position_guard: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_start_unlocked_and_guarded() {
        let args = Args::try_parse_from(["imgoverlay"]).unwrap();
        assert!(args.images.is_empty());
        assert!(!args.locked);
        assert!(!args.no_position_guard);
    }

    #[test]
    fn images_and_flags() {
        let args =
            Args::try_parse_from(["imgoverlay", "a.png", "b.jpg", "--locked", "--no-position-guard"])
                .unwrap();
        assert_eq!(args.images, vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]);
        assert!(args.locked);
        assert!(args.no_position_guard);
    }
}
