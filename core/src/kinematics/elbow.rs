use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::kinematics::{Joint, JointAngles, JointGroup, Side};
use crate::math::{angle_between, vector_from_points};
use crate::prelude::{AngleError, AngleResult, Point3};

/// Elbow yaw and roll from Neck, Shoulder, Elbow and Wrist.
///
/// The upper-arm frame takes Elbow→Shoulder as Z and the normal of the
/// Neck-Shoulder-Elbow plane as X. Yaw is the dihedral angle between that
/// plane and the Shoulder-Elbow-Wrist plane; the forearm's angles to X and Y
/// choose between `-θ`, `θ` and `θ - 2π`.
pub fn elbow_angles(
    side: Side,
    neck: &Point3,
    shoulder: &Point3,
    elbow: &Point3,
    wrist: &Point3,
) -> AngleResult<JointAngles> {
    let group = JointGroup::new(side, Joint::Elbow);
    let [yaw_name, _] = group.angle_names();
    let degenerate = || AngleError::DegenerateGeometry {
        group,
        angle: yaw_name,
    };

    let arm_z = vector_from_points(elbow, shoulder);
    let lateral = vector_from_points(neck, shoulder) * side.orientation();
    let arm_x = arm_z.cross(&lateral);
    let arm_y = arm_z.cross(&arm_x);
    let forearm = vector_from_points(elbow, wrist);
    let forearm_normal = arm_z.cross(&forearm);

    let yaw_module = angle_between(&arm_x, &forearm_normal).ok_or_else(degenerate)?;
    let to_x = angle_between(&forearm, &arm_x).ok_or_else(degenerate)?;
    let to_y = angle_between(&forearm, &arm_y).ok_or_else(degenerate)?;
    let yaw = if to_x <= FRAC_PI_2 {
        -yaw_module
    } else if to_y > FRAC_PI_2 {
        yaw_module
    } else {
        yaw_module - TAU
    };

    let roll = elbow_roll(side, shoulder, elbow, wrist)?;
    Ok(JointAngles::new(group, yaw, roll))
}

/// Elbow roll alone: zero for a straight arm, growing as the elbow flexes.
///
/// Only needs the two arm bones, so it stays defined for a fully extended arm
/// where the yaw planes collapse.
pub fn elbow_roll(side: Side, shoulder: &Point3, elbow: &Point3, wrist: &Point3) -> AngleResult<f64> {
    let group = JointGroup::new(side, Joint::Elbow);
    let upper_arm = vector_from_points(elbow, shoulder);
    let forearm = vector_from_points(elbow, wrist);
    let flex = angle_between(&forearm, &upper_arm).ok_or(AngleError::DegenerateGeometry {
        group,
        angle: group.angle_names()[1],
    })?;
    Ok(PI - flex)
}
