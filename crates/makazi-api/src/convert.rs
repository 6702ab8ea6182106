use crate::dto::{DirectorDto, InquiryDto, PropertyDto, SessionUserDto};
use makazi_model::{AdminUser, Director, Inquiry, Property};

impl From<Property> for PropertyDto {
    fn from(p: Property) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            price: p.price,
            location: p.location,
            property_type: p.property_type,
            status: p.status,
            size: p.size,
            bedrooms: p.bedrooms,
            bathrooms: p.bathrooms,
            offices: p.offices,
            parking: p.parking,
            features: p.features,
            images: p.images,
            featured: p.featured,
            created_at: p.created_at,
        }
    }
}

impl From<Inquiry> for InquiryDto {
    fn from(i: Inquiry) -> Self {
        Self {
            id: i.id,
            name: i.name,
            email: i.email,
            phone: i.phone,
            subject: i.subject,
            message: i.message,
            property_id: i.property_id,
            status: i.status,
            created_at: i.created_at,
        }
    }
}

impl From<Director> for DirectorDto {
    fn from(d: Director) -> Self {
        Self {
            id: d.id,
            name: d.name,
            position: d.position,
            bio: d.bio,
            image_url: d.image_url,
            linkedin: d.linkedin,
            email: d.email,
        }
    }
}

impl From<&AdminUser> for SessionUserDto {
    fn from(u: &AdminUser) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
        }
    }
}
