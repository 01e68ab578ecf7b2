/*!
Reads and writes LAS point data records (formats 0 - 10) and locates the
VLRs and EVLRs of a file without scanning its point data.

```no_run
use las_codec::configs::Configs;
use las_codec::lidar::{LasReader, PointData};
use std::fs::File;

let configs = Configs::new();
let reader = LasReader::new(File::open("points.las")?, &configs)?;
let mut point = PointData::new();
reader.read_point(0, &mut point)?;
println!("{}", point);
# Ok::<(), las_codec::LasError>(())
```
*/
extern crate byteorder;

pub mod configs;
pub mod error;
pub mod lidar;
pub mod utils;

pub use crate::error::{LasError, Result};
