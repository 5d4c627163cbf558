mod angle;
mod fixed;
mod tables;

pub use angle::{ANG90, ANG180, ANG270, Bam};
pub use fixed::{FRACBITS, FRACUNIT, Fixed, fixed_mul};
pub use tables::{ANGLETOFINESHIFT, FINEANGLES, FINEMASK, finecosine, finesine};
