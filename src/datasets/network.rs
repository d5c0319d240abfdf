//! TCP transfer benchmark comparing three copy strategies.
//!
//! The built-in numbers come from `perf stat` runs over a 10 second window,
//! indexed by message size (rows) and client thread count (columns).

use crate::{
    components::style::{Marker, Rgb, StyleRegistry},
    functions::{
        load_nested::{MetricTable, NestedSource},
        load_table::{MetricColumn, TableSchema},
    },
    models::{measurement::Metric, variant::Variant},
};

pub const IMPLEMENTATIONS: [&str; 3] = ["two_copy", "one_copy", "zero_copy"];

pub const MSG_SIZES: [u64; 4] = [1024, 4096, 16384, 65536];
pub const THREAD_COUNTS: [u64; 4] = [1, 2, 4, 8];

pub const SYSTEM_INFO: &str =
    "System: CachyOS Linux | Kernel 6.18.8 | 11th Gen Intel | GCC 15.2.1";

pub const SCHEMA: TableSchema = TableSchema {
    family: None,
    variant: "Implementation",
    primary: "Msg_Size",
    secondary: Some("Threads"),
    metrics: &[
        MetricColumn::required(Metric::ThroughputGbps, &["Throughput_Gbps"]),
        MetricColumn::required(Metric::LatencyUs, &["Latency_us"]),
        MetricColumn::required(Metric::CpuCycles, &["CPU_Cycles"]),
        MetricColumn::required(Metric::L1Misses, &["L1_Misses"]),
        MetricColumn::required(Metric::LlcMisses, &["LLC_Misses"]),
        MetricColumn::optional(Metric::ContextSwitches, &["Context_Switches"]),
    ],
};

pub fn variants() -> Vec<Variant> {
    IMPLEMENTATIONS.iter().map(|name| Variant::new(*name)).collect()
}

pub fn styles() -> StyleRegistry {
    StyleRegistry::new()
        .color("two_copy", Rgb::from_hex(0xe74c3c))
        .color("one_copy", Rgb::from_hex(0x3498db))
        .color("zero_copy", Rgb::from_hex(0x2ecc71))
        .marker("two_copy", Marker::Circle)
        .marker("one_copy", Marker::Square)
        .marker("zero_copy", Marker::Triangle)
        .label("two_copy", "Two-Copy (send/recv)")
        .label("one_copy", "One-Copy (sendmsg/iovec)")
        .label("zero_copy", "Zero-Copy (MSG_ZEROCOPY)")
}

pub const MEASURED: NestedSource<'static> = NestedSource {
    primary: &MSG_SIZES,
    secondary: &THREAD_COUNTS,
    tables: &[
        MetricTable {
            metric: Metric::ThroughputGbps,
            values: &[
                (
                    "two_copy",
                    &[
                        &[4.0526, 7.2182, 11.5245, 15.0278],
                        &[9.3792, 17.6207, 29.5292, 36.8553],
                        &[28.4381, 47.3265, 75.9788, 92.0485],
                        &[62.1391, 108.8889, 153.0088, 72.6156],
                    ],
                ),
                (
                    "one_copy",
                    &[
                        &[3.4985, 6.1208, 9.5012, 13.1207],
                        &[8.1453, 14.1012, 22.5464, 32.1907],
                        &[28.1047, 45.7111, 70.8288, 102.6077],
                        &[60.8287, 99.6969, 136.3410, 70.7146],
                    ],
                ),
                (
                    "zero_copy",
                    &[
                        &[2.5996, 4.5659, 5.8069, 6.5312],
                        &[5.8627, 9.7800, 14.3599, 22.8114],
                        &[19.1856, 32.6854, 50.7948, 77.8352],
                        &[44.2117, 74.1762, 108.3720, 55.4221],
                    ],
                ),
            ],
        },
        MetricTable {
            metric: Metric::LatencyUs,
            values: &[
                (
                    "two_copy",
                    &[
                        &[1.98, 2.23, 2.81, 4.35],
                        &[3.45, 3.68, 4.41, 7.10],
                        &[4.57, 5.49, 6.85, 11.36],
                        &[8.40, 9.59, 13.65, 58.05],
                    ],
                ),
                (
                    "one_copy",
                    &[
                        &[2.30, 2.63, 3.40, 4.94],
                        &[3.98, 4.61, 5.76, 8.10],
                        &[4.62, 5.69, 7.35, 10.19],
                        &[8.58, 10.47, 15.33, 59.80],
                    ],
                ),
                (
                    "zero_copy",
                    &[
                        &[3.11, 3.54, 5.59, 9.98],
                        &[5.55, 6.66, 9.07, 11.54],
                        &[6.79, 7.97, 10.27, 13.41],
                        &[11.82, 14.09, 19.30, 75.64],
                    ],
                ),
            ],
        },
        MetricTable {
            metric: Metric::CpuCycles,
            values: &[
                (
                    "two_copy",
                    &[
                        &[28409387214.0, 53656869628.0, 98527099274.0, 109793973569.0],
                        &[30325097820.0, 56040832104.0, 101208068905.0, 108870743100.0],
                        &[28859351339.0, 51900679772.0, 98551822991.0, 156666506085.0],
                        &[23476236000.0, 45003458263.0, 96926798753.0, 196179908915.0],
                    ],
                ),
                (
                    "one_copy",
                    &[
                        &[26197036869.0, 48722854030.0, 89230041679.0, 98416276944.0],
                        &[27534989237.0, 51645900273.0, 99784457869.0, 102657945724.0],
                        &[28329702835.0, 48985099619.0, 93626222496.0, 117789647445.0],
                        &[23015665302.0, 43351238096.0, 97692143076.0, 191305459679.0],
                    ],
                ),
                (
                    "zero_copy",
                    &[
                        &[24757792086.0, 46163384665.0, 73148978327.0, 93038256848.0],
                        &[22013698281.0, 42354463995.0, 77471874237.0, 81640174916.0],
                        &[22337586104.0, 42363440867.0, 76954329003.0, 92296266222.0],
                        &[26334615178.0, 48849374772.0, 86457315997.0, 272740347885.0],
                    ],
                ),
            ],
        },
        MetricTable {
            metric: Metric::L1Misses,
            values: &[
                (
                    "two_copy",
                    &[
                        &[577269830.0, 1029931837.0, 1711321895.0, 2082553008.0],
                        &[779338898.0, 1413689479.0, 2427089286.0, 2939790466.0],
                        &[1769295799.0, 2977526770.0, 4974295487.0, 5200660043.0],
                        &[3125631810.0, 5449930292.0, 7529531143.0, 3303499054.0],
                    ],
                ),
                (
                    "one_copy",
                    &[
                        &[496639759.0, 954098969.0, 1628522965.0, 1907946837.0],
                        &[733215188.0, 1276592518.0, 2281813026.0, 2810026191.0],
                        &[1785901298.0, 2914253291.0, 4771729282.0, 6435956809.0],
                        &[3055557158.0, 5006103101.0, 6678734522.0, 3186368062.0],
                    ],
                ),
                (
                    "zero_copy",
                    &[
                        &[530650268.0, 950464152.0, 1566456189.0, 2228646062.0],
                        &[640697434.0, 1144758217.0, 1963815186.0, 2431888693.0],
                        &[1401987820.0, 2418568878.0, 3826082786.0, 4947629784.0],
                        &[2369782107.0, 3980599653.0, 6073903248.0, 5777173257.0],
                    ],
                ),
            ],
        },
        MetricTable {
            metric: Metric::LlcMisses,
            values: &[
                (
                    "two_copy",
                    &[
                        &[53160.0, 98894.0, 2138200.0, 5956697.0],
                        &[1230150.0, 10448268.0, 44118371.0, 88090261.0],
                        &[909243.0, 10496775.0, 57809312.0, 476376937.0],
                        &[189089.0, 1543057.0, 149433240.0, 667555881.0],
                    ],
                ),
                (
                    "one_copy",
                    &[
                        &[53414.0, 91160.0, 635681.0, 3725831.0],
                        &[117170.0, 1875381.0, 3324740.0, 46261691.0],
                        &[114923.0, 527981.0, 28288049.0, 220589378.0],
                        &[1269528.0, 1011599.0, 184252608.0, 664411683.0],
                    ],
                ),
                (
                    "zero_copy",
                    &[
                        &[341260.0, 479383.0, 492183.0, 243996.0],
                        &[125821.0, 236086.0, 433265.0, 13874173.0],
                        &[569537.0, 3854646.0, 14246940.0, 154217685.0],
                        &[117846.0, 1052951.0, 91852926.0, 635737610.0],
                    ],
                ),
            ],
        },
        MetricTable {
            metric: Metric::ContextSwitches,
            values: &[
                (
                    "two_copy",
                    &[
                        &[1203950.0, 1941694.0, 2467585.0, 3929514.0],
                        &[926993.0, 1640263.0, 2087803.0, 3122686.0],
                        &[941442.0, 1508885.0, 1913540.0, 1513207.0],
                        &[1167046.0, 1886938.0, 1991288.0, 46606.0],
                    ],
                ),
                (
                    "one_copy",
                    &[
                        &[1269609.0, 2148521.0, 2734496.0, 3398853.0],
                        &[1072824.0, 1687675.0, 1985056.0, 3419583.0],
                        &[1047254.0, 1644095.0, 1917276.0, 3169609.0],
                        &[1139720.0, 1703889.0, 1622218.0, 50031.0],
                    ],
                ),
                (
                    "zero_copy",
                    &[
                        &[1196035.0, 1914164.0, 3259553.0, 4472138.0],
                        &[1583067.0, 2287885.0, 2781589.0, 3335481.0],
                        &[1345718.0, 1995664.0, 2500616.0, 2628984.0],
                        &[837758.0, 1233415.0, 1507846.0, 63354.0],
                    ],
                ),
            ],
        },
    ],
};
