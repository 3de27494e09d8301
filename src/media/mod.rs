//! Video upload transcoding through an external encoder

pub mod transcoder;

pub use transcoder::{
    ffmpeg_args, output_filename, FfmpegTranscoder, MediaError, Transcoder, VideoConverter,
};
