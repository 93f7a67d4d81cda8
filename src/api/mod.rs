/*!
PWI4 status model and command arguments.

Most PWI4 commands answer with the full server status as a list of
`key=value` lines, for example:

```text
mount.is_tracking=true
mount.axis0.position_degs=45.0
```

These are decoded in one pass into a [`StatusSnapshot`], which groups the
values by subsystem: [`Site`], [`Mount`] (with its two [`Axis`] entries and
the pointing [`Model`]), [`Focuser`], [`Rotator`], [`M3`] and [`AutoFocus`].

Decoding is all-or-nothing: a missing key, an unparsable number or an
unknown [`Geometry`] code fails the whole decode and leaves any previous
snapshot as it was. Booleans are lenient: `true` in any casing is true,
anything else is false.
*/

mod coerce;

mod site;
pub use site::Site;

mod mount;
pub use mount::{Axis, AxisId, Geometry, GuideDirection, Model, Mount};

mod focuser;
pub use focuser::Focuser;

mod rotator;
pub use rotator::Rotator;

mod m3;
pub use m3::M3;

mod autofocus;
pub use autofocus::AutoFocus;

mod status;
pub use status::StatusSnapshot;

mod offset;
pub use offset::{Offset, OffsetAxis};

mod tle;
pub use tle::{Tle, TleInput};
