use std::f64::consts::FRAC_PI_2;

use crate::kinematics::{Joint, JointAngles, JointGroup, Side};
use crate::math::{angle_between, vector_from_points};
use crate::prelude::{AngleError, AngleResult, Point3};

/// Shoulder pitch and roll from Neck, Shoulder, Elbow and MidHip.
///
/// The torso frame takes MidHip→Neck as Z, the torso/shoulder-line normal as
/// X and `Z × X` as Y. Pitch is the angle between Z and the normal of the
/// plane spanned by Y and the upper arm, signed by whether the upper arm
/// points above or below the torso's horizontal. Roll measures the upper arm
/// against Y; the left arm uses `π/2 − θ` and the right arm `θ − π/2`.
pub fn shoulder_angles(
    side: Side,
    neck: &Point3,
    shoulder: &Point3,
    elbow: &Point3,
    mid_hip: &Point3,
) -> AngleResult<JointAngles> {
    let group = JointGroup::new(side, Joint::Shoulder);
    let [pitch_name, roll_name] = group.angle_names();
    let degenerate = |angle| AngleError::DegenerateGeometry { group, angle };

    let torso_z = vector_from_points(mid_hip, neck);
    let lateral = vector_from_points(neck, shoulder) * side.orientation();
    let torso_x = torso_z.cross(&lateral);
    let torso_y = torso_z.cross(&torso_x);
    let upper_arm = vector_from_points(shoulder, elbow);

    let pitch_module = angle_between(&torso_z, &torso_y.cross(&upper_arm))
        .ok_or_else(|| degenerate(pitch_name))?;
    let elevation = angle_between(&upper_arm, &torso_z).ok_or_else(|| degenerate(pitch_name))?;
    let pitch = if elevation <= FRAC_PI_2 {
        -pitch_module
    } else {
        pitch_module
    };

    let spread = angle_between(&upper_arm, &torso_y).ok_or_else(|| degenerate(roll_name))?;
    let roll = match side {
        Side::Left => FRAC_PI_2 - spread,
        Side::Right => spread - FRAC_PI_2,
    };

    Ok(JointAngles::new(group, pitch, roll))
}
