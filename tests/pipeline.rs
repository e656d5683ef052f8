//! End-to-end scenario: write a synthetic corpus to disk, run the full
//! extraction, then read the containers back through the accessors.

use std::fs;
use std::path::Path;

use rigdata::dataset::{ImuDataset, PositionDataset, RingDataset, SessionStore};
use rigdata::extract::run_extraction;
use rigdata::ExtractConfig;

const AXES: [&str; 9] = [
    "acc_x", "acc_y", "acc_z", "mag_x", "mag_y", "mag_z", "gyro_x", "gyro_y", "gyro_z",
];

fn imu_sensors(v: f64) -> String {
    let axes: String = AXES.iter().map(|k| format!("{k}=\"{v}\" ")).collect();
    let hand = |loc: &str| -> String {
        ["az", "az_base", "elev", "elev_base"]
            .iter()
            .map(|m| format!("{loc}_{m}=\"0.5\" "))
            .collect()
    };
    let trunk: String = ["alpha", "pitch", "roll", "yaw"]
        .iter()
        .map(|m| format!("trunk_{m}=\"0.5\" "))
        .collect();
    format!(
        r#"<sensor name="lh" {a}/>
           <sensor name="rh" {a}/>
           <sensor name="trunk" {a}/>
           <sensor type="measured_angles" {lh}{rh}{trunk}/>"#,
        a = axes,
        lh = hand("lh"),
        rh = hand("rh"),
    )
}

fn session_xml() -> String {
    let frame = |t: u32, pressure: f64, speaker: &str| {
        format!(
            r#"<frame>
                 <block name="ring" timestamp="{t}">
                   <sensors>
                     <sensor type="pressure" baseline="5.0" value="{pressure}" raw_value="12.0"/>
                     <sensor type="imu" {axes}/>
                   </sensors>
                   <actuators>
                     <actuator type="speaker" active="{speaker}"/>
                     <actuator type="light" active="false"/>
                   </actuators>
                 </block>
                 <block name="body_imu" timestamp="{t}">
                   <sensors>{imu}</sensors>
                 </block>
                 <block name="position" timestamp="{t}" error="{err}">
                   <sensors>
                     <sensor location="head" x="0.1" y="0.2" z="0.3"/>
                   </sensors>
                 </block>
               </frame>"#,
            axes = AXES.iter().map(|k| format!("{k}=\"1.0\" ")).collect::<String>(),
            imu = imu_sensors(1.0),
            err = if t == 0 { 0 } else { 7 },
        )
    };
    format!(
        "<session>{}{}</session>",
        frame(0, 10.0, "true"),
        frame(1000, 11.0, "false")
    )
}

fn write_session(root: &Path, subject: &str, session: &str, xml: &str) {
    let dir = root.join(subject).join(session);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("sensors.xml"), xml).unwrap();
}

#[test]
fn extraction_then_read_round_trips() {
    let tmp = tempfile::tempdir().unwrap();
    let corpus = tmp.path().join("corpus");
    let out = tmp.path().join("out");

    write_session(&corpus, "223", "20140630-1648", &session_xml());
    write_session(&corpus, "224", "20140701-0930", &session_xml());
    // Session directory without a sensors.xml: skipped, run continues.
    fs::create_dir_all(corpus.join("225").join("20140702-1000")).unwrap();
    // Unparsable document: skipped as well.
    write_session(&corpus, "226", "20140703-1100", "<session><frame>");

    let cfg = ExtractConfig::new(&corpus, &out);
    let summary = run_extraction(&cfg).unwrap();
    assert_eq!(summary.sessions, 2);
    assert_eq!(summary.skipped, 2);

    assert!(out.join("ringDataset.bin").exists());
    assert!(out.join("imuDataset.bin").exists());
    assert!(out.join("positionDataset.bin").exists());
    // No mat blocks anywhere: no mat container is written.
    assert!(!out.join("matDataset.bin").exists());

    // -- ring --
    let ring = RingDataset::open(&out.join("ringDataset.bin")).unwrap();
    assert_eq!(ring.len(), 2);
    assert_eq!(ring.ids()[0], "223_20140630-1648");

    let record = ring.read(&("223", "20140630-1648").into(), false).unwrap();
    assert_eq!(record["baseline"].as_scalar(), Some(5.0));
    assert_eq!(record["pressure"].as_series(), Some(&[10.0, 11.0][..]));
    assert_eq!(record["speaker"].as_series(), Some(&[1.0, 0.0][..]));
    assert_eq!(record["light"].as_series(), Some(&[0.0, 0.0][..]));
    // Zero-shifted seconds.
    assert_eq!(record["intervals"].as_series(), Some(&[0.0, 1.0][..]));

    let n = record["intervals"].as_series().unwrap().len();
    for (name, signal) in &record {
        if let Some(series) = signal.as_series() {
            assert_eq!(series.len(), n, "{name}");
        }
    }

    let merged = ring.merge_all().unwrap();
    assert_eq!(merged.ids.len(), 2);
    for column in merged.columns.values() {
        assert_eq!(column.len(), 2);
    }
    assert_eq!(merged.columns["pressure"][1], ring.read(&1.into(), false).unwrap()["pressure"]);

    // -- imu --
    let imu = ImuDataset::open(&out.join("imuDataset.bin")).unwrap();
    let record = imu.read(&0.into(), false).unwrap();
    assert_eq!(record["lh_acc_x"].as_series(), Some(&[1.0, 1.0][..]));
    assert_eq!(record["trunk_yaw"].as_series(), Some(&[0.5, 0.5][..]));

    // -- position --
    let position = PositionDataset::open(&out.join("positionDataset.bin")).unwrap();
    let record = position.read(&0.into(), false).unwrap();
    assert_eq!(record["error"].as_series(), Some(&[0.0, 1.0][..]));
    let head = record["head"].as_nested().unwrap();
    assert_eq!(head["z"], vec![0.3, 0.3]);

    let merged = position.merge_all().unwrap();
    assert_eq!(merged.columns["head"].len(), 2);
}

#[test]
fn absolute_time_preserves_stored_timestamps() {
    let tmp = tempfile::tempdir().unwrap();
    let corpus = tmp.path().join("corpus");
    let out = tmp.path().join("out");
    write_session(&corpus, "223", "s1", &session_xml());

    run_extraction(&ExtractConfig::new(&corpus, &out)).unwrap();
    let ring = RingDataset::open(&out.join("ringDataset.bin")).unwrap();
    let record = ring.read(&0.into(), true).unwrap();
    assert_eq!(record["intervals"].as_series(), Some(&[0.0, 1000.0][..]));
}
