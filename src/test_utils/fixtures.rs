/// A complete status reply, as sent by PWI4 for every status-bearing command.
pub(crate) const STATUS_BODY: &str = "\
pwi4.version=4.0.99 beta 22
site.latitude_degs=51.4545
site.longitude_degs=-2.5879
site.height_meters=61
site.lmst_hours=13.0772
mount.is_connected=true
mount.geometry=1
mount.ra_apparent_hours=10.2031
mount.dec_apparent_degs=-5.0012
mount.ra_j2000_hours=10.1926
mount.dec_j2000_degs=-4.9413
mount.target_ra_apparent_hours=10.5
mount.target_dec_apparent_degs=-5.25
mount.azimuth_degs=178.31
mount.altitude_degs=33.54
mount.is_slewing=false
mount.is_tracking=true
mount.field_angle_here_degs=12.5
mount.field_angle_at_target_degs=12.75
mount.field_angle_rate_at_target_degs_per_sec=0.001
mount.path_angle_at_target_degs=91.5
mount.path_angle_rate_at_target_degs_per_sec=-0.002
mount.axis0.is_enabled=True
mount.axis0.rms_error_arcsec=0.12
mount.axis0.dist_to_target_arcsec=1.5
mount.axis0.servo_error_arcsec=0.03
mount.axis0.position_degs=45.0
mount.axis1.is_enabled=TRUE
mount.axis1.rms_error_arcsec=0.21
mount.axis1.dist_to_target_arcsec=2.5
mount.axis1.servo_error_arcsec=0.04
mount.axis1.position_degs=56.46
mount.model.filename=default_model.pxp
mount.model.num_points_total=42
mount.model.num_points_enabled=40
mount.model.rms_error_arcsec=8.7
focuser.is_connected=true
focuser.is_enabled=false
focuser.position=12500.5
focuser.is_moving=false
rotator.is_connected=true
rotator.is_enabled=true
rotator.mech_position_degs=180.25
rotator.field_angle_degs=12.5
rotator.is_moving=false
rotator.is_slewing=false
m3.port=2
autofocus.is_running=false
autofocus.success=true
autofocus.best_position=12480.25
autofocus.tolerance=3.5
";

/// [`STATUS_BODY`] without the line for `key`.
pub(crate) fn status_body_without(key: &str) -> String {
    let prefix = format!("{key}=");
    STATUS_BODY
        .lines()
        .filter(|line| !line.starts_with(&prefix))
        .map(|line| format!("{line}\n"))
        .collect()
}

/// [`STATUS_BODY`] with the value for `key` replaced.
pub(crate) fn status_body_with(key: &str, value: &str) -> String {
    let prefix = format!("{key}=");
    STATUS_BODY
        .lines()
        .map(|line| {
            if line.starts_with(&prefix) {
                format!("{prefix}{value}\n")
            } else {
                format!("{line}\n")
            }
        })
        .collect()
}

/// Every key present in [`STATUS_BODY`].
pub(crate) fn status_keys() -> impl Iterator<Item = &'static str> {
    STATUS_BODY
        .lines()
        .filter_map(|line| line.split_once('=').map(|(key, _)| key))
}
