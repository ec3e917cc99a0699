/// ARC statistics as exposed by ZFS on Linux
pub const DEMO_ARCSTATS: &str = "\
13 1 0x01 96 26112 4975137318 180379513512094
name                            type data
hits                            4    8772461
misses                          4    1053278
demand_data_hits                4    4123511
demand_data_misses              4    98811
prefetch_data_hits              4    51240
size                            4    49720066048
c                               4    49910562816
c_min                           4    1073741824
c_max                           4    67420262400
l2_hits                         4    0
l2_misses                       4    0
l2_size                         4    0
memory_throttle_count           4    0
arc_meta_used                   4    1987342336
arc_no_grow                     1    0
";

/// ZIL statistics
pub const DEMO_ZIL: &str = "\
15 1 0x01 13 3536 4975145002 180379513891228
name                            type data
zil_commit_count                4    2013
zil_commit_writer_count         4    1987
zil_itx_count                   4    48211
zil_itx_indirect_count          4    0
zil_itx_indirect_bytes          4    0
";

/// Prefetcher statistics
pub const DEMO_ZFETCHSTATS: &str = "\
2 1 0x01 3 144 4975129882 180379514057711
name                            type data
hits                            4    341092
misses                          4    1204233
max_streams                     4    1160187
";

/// Mirror vdev selection counters
pub const DEMO_VDEV_MIRROR_STATS: &str = "\
18 1 0x01 7 1904 4975187332 180379514201883
name                            type data
rotating_linear                 4    0
rotating_offset                 4    0
rotating_seek                   4    0
non_rotating_linear             4    0
non_rotating_seek               4    0
preferred_found                 4    0
preferred_not_found             4    12
";

/// Per-pool I/O counters for `data`
pub const DEMO_DATA_IO: &str = "\
40 3 0x00 1 80 5112391427 180379514310034
nread    nwritten reads    writes   wtime    wlentime wupdate  rtime    rlentime rupdate  wcnt     rcnt
1260540416 3473735680 184225 512837 4174713217 283716728140 180379497551391 19262981049 1124773301452 180379497585092 0 0
";

/// Per-pool I/O counters for `boot-pool`
pub const DEMO_BOOT_POOL_IO: &str = "\
41 3 0x00 1 80 5119327184 180379514318751
nread    nwritten reads    writes   wtime    wlentime wupdate  rtime    rlentime rupdate  wcnt     rcnt
88502272 20480000 4096 1850 101938443 880199243 180379470000000 1123399382 3310238112 180379470000111 0 0
";

/// kstat tree relative to `spl/kstat/zfs`
pub const DEMO_KSTAT_FILES: &[(&str, &str)] = &[
    ("arcstats", DEMO_ARCSTATS),
    ("zil", DEMO_ZIL),
    ("zfetchstats", DEMO_ZFETCHSTATS),
    ("vdev_mirror_stats", DEMO_VDEV_MIRROR_STATS),
    ("boot-pool/io", DEMO_BOOT_POOL_IO),
    ("data/io", DEMO_DATA_IO),
];

/// `kstat -j "/zfs|zone_zfs/:::"` as printed on illumos
pub const DEMO_KSTAT_JSON: &str = r#"[
  {
    "module": "zfs",
    "instance": 0,
    "name": "arcstats",
    "class": "misc",
    "type": 1,
    "snaptime": 180379.513512094,
    "data": {
      "hits": 8772461,
      "misses": 1053278,
      "size": 49720066048,
      "c_max": 67420262400
    }
  },
  {
    "module": "zfs",
    "instance": 0,
    "name": "rpool",
    "class": "disk",
    "type": 3,
    "snaptime": 180379.514310034,
    "data": {
      "nread": 1260540416,
      "nwritten": 3473735680,
      "reads": 184225,
      "writes": 512837
    }
  },
  {
    "module": "zone_zfs",
    "instance": 0,
    "name": "global",
    "class": "zone_zfs",
    "type": 1,
    "snaptime": 180379.514318751,
    "data": {
      "nread": 88502272,
      "nwritten": 20480000,
      "reads": 4096,
      "writes": 1850,
      "zonename": "global"
    }
  },
  {
    "module": "zfs",
    "instance": 0,
    "name": "vdev_cache_stats",
    "class": "vdev",
    "type": 1,
    "snaptime": 180379.514401102,
    "data": {
      "delegations": 0
    }
  }
]
"#;
