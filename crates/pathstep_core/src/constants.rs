pub(crate) const EARTH_RADIUS_KM: f64 = 6_371.0;
